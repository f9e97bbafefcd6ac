use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

/// The API serves `null` for unset text and enum columns.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Book as served by the resource API.
///
/// `location` and `press` are only filled when fetched with `$expand` and are
/// never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Book {
    pub id: i64,
    #[serde(rename = "ISBN", default, deserialize_with = "null_as_default")]
    pub isbn: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub author: String,
    pub price: Decimal,
    pub location_id: i64,
    pub press_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Address>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub press: Option<Press>,
}

/// Body of a create request: every writable field, no identity, no expansions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NewBook {
    #[serde(rename = "ISBN")]
    pub isbn: String,
    pub title: String,
    pub author: String,
    pub price: Decimal,
    pub location_id: i64,
    pub press_id: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Press {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub category: Category,
}

impl Press {
    pub fn label(&self) -> String {
        self.name.clone()
    }
}

/// Press category, sent by the API as the member name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Academic,
    Fiction,
    NonFiction,
    Technical,
    Children,
    /// Any member this client does not know yet, or none at all
    #[default]
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub id: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub street: String,
}

impl Address {
    pub fn label(&self) -> String {
        format!("{}, {}", self.city, self.street)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn book_decodes_with_and_without_expansion() {
        let plain: Book = serde_json::from_value(json!({
            "Id": 1, "ISBN": "978-0", "Title": "Dune", "Author": "Frank Herbert",
            "Price": 9.99, "LocationId": 7, "PressId": 3
        }))
        .unwrap();
        assert_eq!(plain.price, Decimal::new(999, 2));
        assert!(plain.press.is_none());

        let expanded: Book = serde_json::from_value(json!({
            "Id": 1, "ISBN": "978-0", "Title": "Dune", "Author": "Frank Herbert",
            "Price": 9.99, "LocationId": 7, "PressId": 3,
            "Location": {"Id": 7, "City": "Reno", "Street": "Main St"},
            "Press": {"Id": 3, "Name": "Acme", "Email": "a@acme.test", "Category": "Fiction"}
        }))
        .unwrap();
        assert_eq!(expanded.location.unwrap().label(), "Reno, Main St");
        assert_eq!(expanded.press.unwrap().category, Category::Fiction);
    }

    #[test]
    fn unknown_category_decodes_as_other() {
        let press: Press = serde_json::from_value(json!({
            "Id": 1, "Name": "Zed", "Email": "z@zed.test", "Category": "Poetry"
        }))
        .unwrap();
        assert_eq!(press.category, Category::Other);
    }

    #[test]
    fn null_columns_decode_as_blank() {
        let press: Press = serde_json::from_value(json!({
            "Id": 3, "Name": "Acme", "Email": null, "Category": null
        }))
        .unwrap();
        assert_eq!(press.email, None);
        assert_eq!(press.category, Category::Other);
        assert_eq!(press.label(), "Acme");

        let book: Book = serde_json::from_value(json!({
            "Id": 1, "ISBN": null, "Title": "Dune", "Author": null,
            "Price": 9.99, "LocationId": 7, "PressId": 3
        }))
        .unwrap();
        assert_eq!(book.author, "");
        assert_eq!(book.isbn, "");
    }

    #[test]
    fn new_book_serializes_every_writable_field() {
        let book = NewBook {
            isbn: "978-1".to_string(),
            title: "Emma".to_string(),
            author: "Jane Austen".to_string(),
            price: Decimal::new(1250, 2),
            location_id: 7,
            press_id: 3,
        };

        let value = serde_json::to_value(&book).unwrap();
        let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys.len(), 6);
        assert_eq!(value["ISBN"], "978-1");
        assert_eq!(value["Price"], 12.5);
        assert!(value.get("Id").is_none());
    }
}
