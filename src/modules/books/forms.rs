//! Request-scoped form models for creating and editing books.

use std::str::FromStr;

use bookshelf_resource::{Field, Patch};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::models::{Book, NewBook};
use crate::references::{ReferenceLists, ReferenceOption};

/// A message attached to one input, or to the whole form when `field` is `None`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    pub message: String,
}

impl FieldError {
    pub fn on(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: Some(field.to_string()),
            message: message.into(),
        }
    }

    pub fn form(message: impl Into<String>) -> Self {
        Self {
            field: None,
            message: message.into(),
        }
    }
}

/// Blank inputs are not entered; anything else has to parse as `T`.
fn parse_input<T: FromStr>(raw: Option<&str>) -> Result<Option<T>, T::Err> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(text) => text.parse().map(Some),
    }
}

fn not_a_number(field: &str) -> FieldError {
    FieldError::on(field, format!("{field} must be a number"))
}

fn number_input<T: FromStr>(raw: Option<&str>, field: &str, errors: &mut Vec<FieldError>) -> Option<T> {
    parse_input(raw).unwrap_or_else(|_| {
        errors.push(not_a_number(field));
        None
    })
}

/// Edit form exactly as posted; numbers are still text.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EditBookInput {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub press_id: Option<String>,
    #[serde(default)]
    pub address_id: Option<String>,
}

impl EditBookInput {
    /// Typed form plus one error per number that did not parse.
    ///
    /// Unparseable numbers are left out of the form; text is kept as entered.
    pub fn parse(self) -> (EditBookForm, Vec<FieldError>) {
        let mut errors = Vec::new();
        let form = EditBookForm {
            id: number_input(self.id.as_deref(), "Id", &mut errors),
            press_id: number_input(self.press_id.as_deref(), "PressId", &mut errors),
            address_id: number_input(self.address_id.as_deref(), "AddressId", &mut errors),
            title: self.title,
            author: self.author,
        };
        (form, errors)
    }
}

/// Editable projection of a book.
///
/// Every optional field distinguishes "leave unchanged" (`None`) from "set".
/// ISBN and price are deliberately not part of it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EditBookForm {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub press_id: Option<i64>,
    pub address_id: Option<i64>,
}

impl EditBookForm {
    pub fn from_book(book: &Book) -> Self {
        Self {
            id: Some(book.id),
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            press_id: Some(book.press_id),
            address_id: Some(book.location_id),
        }
    }

    /// Structural checks against the id taken from the request path.
    ///
    /// Returns the confirmed entity id.
    pub fn validate(&self, path_id: i64) -> Result<i64, Vec<FieldError>> {
        let mut errors = Vec::new();

        match self.id {
            None => errors.push(FieldError::on("Id", "Id is required")),
            Some(id) if id != path_id => errors.push(FieldError::on(
                "Id",
                format!("Id {id} does not match the book being edited ({path_id})"),
            )),
            Some(_) => {}
        }

        if matches!(self.press_id, Some(id) if id <= 0) {
            errors.push(FieldError::on("PressId", "Select a valid press"));
        }
        if matches!(self.address_id, Some(id) if id <= 0) {
            errors.push(FieldError::on("AddressId", "Select a valid address"));
        }

        if errors.is_empty() {
            Ok(path_id)
        } else {
            Err(errors)
        }
    }

    /// Build the sparse update for this form.
    ///
    /// `AddressId` is the form's name for the book's `LocationId`.
    pub fn to_patch(&self, id: i64) -> Patch {
        Patch::keyed("Id", id)
            .field("Title", Field::non_empty(self.title.clone()))
            .field("Author", Field::non_empty(self.author.clone()))
            .field("PressId", Field::from(self.press_id))
            .field("LocationId", Field::from(self.address_id))
    }
}

/// Edit form plus what is needed to render its selectors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EditBookView {
    #[serde(flatten)]
    pub form: EditBookForm,
    pub presses: Vec<ReferenceOption>,
    pub addresses: Vec<ReferenceOption>,
    pub errors: Vec<FieldError>,
}

impl EditBookView {
    pub fn new(form: EditBookForm, references: ReferenceLists, errors: Vec<FieldError>) -> Self {
        Self {
            form,
            presses: references.presses,
            addresses: references.addresses,
            errors,
        }
    }
}

/// Create form as posted by the user; every input is kept as entered text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateBookForm {
    #[serde(rename = "ISBN", default)]
    pub isbn: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub author: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub press_id: String,
    #[serde(default)]
    pub location_id: String,
}

impl CreateBookForm {
    pub fn validate(&self) -> Result<NewBook, Vec<FieldError>> {
        let mut errors = Vec::new();

        for (name, value) in [
            ("ISBN", &self.isbn),
            ("Title", &self.title),
            ("Author", &self.author),
        ] {
            if value.trim().is_empty() {
                errors.push(FieldError::on(name, format!("{name} is required")));
            }
        }

        let price = match parse_input::<Decimal>(Some(self.price.as_str())) {
            Err(_) => {
                errors.push(not_a_number("Price"));
                Decimal::ZERO
            }
            Ok(None) => {
                errors.push(FieldError::on("Price", "Price is required"));
                Decimal::ZERO
            }
            Ok(Some(price)) if price.is_sign_negative() => {
                errors.push(FieldError::on("Price", "Price cannot be negative"));
                price
            }
            Ok(Some(price)) => price,
        };

        let press_id = required_reference(&self.press_id, "PressId", "Select a press", &mut errors);
        let location_id =
            required_reference(&self.location_id, "LocationId", "Select an address", &mut errors);

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(NewBook {
            isbn: self.isbn.trim().to_string(),
            title: self.title.trim().to_string(),
            author: self.author.trim().to_string(),
            price,
            location_id,
            press_id,
        })
    }
}

fn required_reference(
    raw: &str,
    field: &str,
    message: &str,
    errors: &mut Vec<FieldError>,
) -> i64 {
    match parse_input::<i64>(Some(raw)) {
        Ok(Some(id)) if id > 0 => id,
        Err(_) => {
            errors.push(not_a_number(field));
            0
        }
        Ok(_) => {
            errors.push(FieldError::on(field, message));
            0
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateBookView {
    #[serde(flatten)]
    pub form: CreateBookForm,
    pub presses: Vec<ReferenceOption>,
    pub addresses: Vec<ReferenceOption>,
    pub errors: Vec<FieldError>,
}

impl CreateBookView {
    pub fn new(form: CreateBookForm, references: ReferenceLists, errors: Vec<FieldError>) -> Self {
        Self {
            form,
            presses: references.presses,
            addresses: references.addresses,
            errors,
        }
    }
}

/// Delete confirmation post.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DeleteBookForm {
    #[serde(default)]
    pub id: Option<String>,
}

impl DeleteBookForm {
    /// The posted id, when one was entered and it is a number.
    pub fn book_id(&self) -> Option<i64> {
        parse_input(self.id.as_deref()).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn form(id: i64) -> EditBookForm {
        EditBookForm {
            id: Some(id),
            ..EditBookForm::default()
        }
    }

    #[test]
    fn untouched_form_patches_only_the_key() {
        assert_eq!(form(4).to_patch(4).to_value(), json!({"Id": 4}));

        let blank = EditBookForm {
            title: Some(String::new()),
            author: Some(String::new()),
            ..form(4)
        };
        assert_eq!(blank.to_patch(4).to_value(), json!({"Id": 4}));
    }

    #[test]
    fn single_field_patch_carries_just_that_field() {
        let edited = EditBookForm {
            title: Some("New Title".to_string()),
            ..form(4)
        };
        assert_eq!(
            edited.to_patch(4).to_value(),
            json!({"Id": 4, "Title": "New Title"})
        );
    }

    #[test]
    fn address_is_sent_as_location() {
        let edited = EditBookForm {
            address_id: Some(7),
            ..form(4)
        };
        let patch = edited.to_patch(4);
        assert!(patch.contains("LocationId"));
        assert!(!patch.contains("AddressId"));
        assert_eq!(patch.to_value(), json!({"Id": 4, "LocationId": 7}));
    }

    #[test]
    fn every_field_set() {
        let edited = EditBookForm {
            id: Some(4),
            title: Some("T".to_string()),
            author: Some("A".to_string()),
            press_id: Some(3),
            address_id: Some(7),
        };
        assert_eq!(
            edited.to_patch(4).to_value(),
            json!({"Id": 4, "Title": "T", "Author": "A", "PressId": 3, "LocationId": 7})
        );
    }

    #[test]
    fn validation_requires_matching_id() {
        assert_eq!(form(4).validate(4), Ok(4));

        let missing = EditBookForm::default().validate(4).unwrap_err();
        assert_eq!(missing[0].field.as_deref(), Some("Id"));

        let mismatched = form(5).validate(4).unwrap_err();
        assert!(mismatched[0].message.contains("does not match"));
    }

    #[test]
    fn validation_rejects_non_positive_references() {
        let bad = EditBookForm {
            press_id: Some(0),
            address_id: Some(-1),
            ..form(4)
        };
        let errors = bad.validate(4).unwrap_err();
        let fields: Vec<_> = errors.iter().filter_map(|e| e.field.as_deref()).collect();
        assert_eq!(fields, vec!["PressId", "AddressId"]);
    }

    fn posted(body: &str) -> (EditBookForm, Vec<FieldError>) {
        serde_urlencoded::from_str::<EditBookInput>(body).unwrap().parse()
    }

    #[test]
    fn blank_form_inputs_decode_as_absent() {
        let (decoded, errors) = posted("Id=4&Title=&Author=Herbert&PressId=&AddressId=7");
        assert!(errors.is_empty());
        assert_eq!(decoded.id, Some(4));
        assert_eq!(decoded.title.as_deref(), Some(""));
        assert_eq!(decoded.press_id, None);
        assert_eq!(decoded.address_id, Some(7));

        let patch = decoded.to_patch(4);
        assert_eq!(patch.to_value(), json!({"Id": 4, "Author": "Herbert", "LocationId": 7}));
    }

    #[test]
    fn submitted_option_lists_are_ignored() {
        let (decoded, errors) = posted("Id=4&Presses=forged&Addresses=forged");
        assert!(errors.is_empty());
        assert_eq!(decoded, form(4));
    }

    #[test]
    fn malformed_numbers_become_field_errors() {
        let (decoded, errors) = posted("Id=4&Title=Kept+Title&PressId=abc&AddressId=7.5");
        assert_eq!(decoded.id, Some(4));
        assert_eq!(decoded.title.as_deref(), Some("Kept Title"));
        assert_eq!(decoded.press_id, None);
        assert_eq!(decoded.address_id, None);

        let fields: Vec<_> = errors.iter().filter_map(|e| e.field.as_deref()).collect();
        assert_eq!(fields, vec!["PressId", "AddressId"]);
        assert_eq!(errors[0].message, "PressId must be a number");
    }

    #[test]
    fn delete_form_id_must_be_numeric() {
        let parse = |body: &str| serde_urlencoded::from_str::<DeleteBookForm>(body).unwrap().book_id();
        assert_eq!(parse("Id=3"), Some(3));
        assert_eq!(parse("Id="), None);
        assert_eq!(parse("Id=three"), None);
        assert_eq!(parse(""), None);
    }

    #[test]
    fn create_form_validates_into_new_book() {
        let decoded: CreateBookForm = serde_urlencoded::from_str(
            "ISBN=978-1&Title=Emma&Author=Jane+Austen&Price=12.50&PressId=3&LocationId=7",
        )
        .unwrap();

        let book = decoded.validate().unwrap();
        assert_eq!(book.title, "Emma");
        assert_eq!(book.price, Decimal::new(1250, 2));
        assert_eq!(book.press_id, 3);
    }

    #[test]
    fn create_form_reports_each_missing_field() {
        let decoded: CreateBookForm =
            serde_urlencoded::from_str("ISBN=&Title=Emma&Author=&Price=-1&PressId=&LocationId=7")
                .unwrap();

        let errors = decoded.validate().unwrap_err();
        let fields: Vec<_> = errors.iter().filter_map(|e| e.field.as_deref()).collect();
        assert_eq!(fields, vec!["ISBN", "Author", "Price", "PressId"]);
    }

    #[test]
    fn create_form_reports_malformed_numbers() {
        let decoded: CreateBookForm = serde_urlencoded::from_str(
            "ISBN=978-1&Title=Emma&Author=Jane&Price=cheap&PressId=3&LocationId=x7",
        )
        .unwrap();
        assert_eq!(decoded.price, "cheap");

        let errors = decoded.validate().unwrap_err();
        assert_eq!(
            errors,
            vec![
                FieldError::on("Price", "Price must be a number"),
                FieldError::on("LocationId", "LocationId must be a number"),
            ]
        );
    }

    #[test]
    fn edit_view_flattens_form_fields() {
        let view = EditBookView {
            form: form(4),
            presses: vec![ReferenceOption::new(3, "Acme")],
            addresses: Vec::new(),
            errors: vec![FieldError::form("try again")],
        };
        let value = serde_json::to_value(&view).unwrap();
        assert_eq!(value["Id"], 4);
        assert_eq!(value["Presses"][0], json!({"value": "3", "label": "Acme"}));
        assert_eq!(value["Errors"][0], json!({"message": "try again"}));
    }
}
