pub mod editor;
pub mod forms;
pub mod handlers;
pub mod models;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    routing::{get, post},
    Router,
};
use bookshelf_kernel::{InitCtx, Module};
use bookshelf_resource::ResourceApi;
use serde_json::json;

use handlers::BooksState;

/// Collection name on the resource API
pub const BOOKS: &str = "books";

/// Where successful writes send the user
pub const LISTING_PATH: &str = "/api/books";

/// Books module: listing, details, create, edit and delete over the resource API
pub struct BooksModule {
    state: BooksState,
}

impl BooksModule {
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        Self {
            state: BooksState::new(api),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            upstream = %ctx.settings.upstream.base_url,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/", get(handlers::list_books))
            .route("/health", get(handlers::health_check))
            .route(
                "/create",
                get(handlers::create_form).post(handlers::create_book),
            )
            .route("/{id}", get(handlers::book_details))
            .route(
                "/edit/{id}",
                get(handlers::edit_form).post(handlers::edit_book),
            )
            .route("/delete/{id}", get(handlers::delete_form))
            .route("/delete-confirmed", post(handlers::delete_confirmed))
            .with_state(self.state.clone())
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        let error = json!({
            "description": "Error",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ErrorResponse" }
                }
            }
        });
        let id_param = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);
        let redirect = json!({ "description": "Saved; redirect to the listing" });

        Some(json!({
            "paths": {
                "/": {
                    "get": {
                        "summary": "List books",
                        "tags": ["Books"],
                        "responses": {
                            "200": {
                                "description": "Books, empty when the catalogue is unavailable",
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": { "$ref": "#/components/schemas/Book" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/{id}": {
                    "get": {
                        "summary": "Book details with press and location",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "Book",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/Book" }
                                    }
                                }
                            },
                            "404": error
                        }
                    }
                },
                "/create": {
                    "get": {
                        "summary": "Blank create form",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "Create form view" }
                        }
                    },
                    "post": {
                        "summary": "Create a book",
                        "tags": ["Books"],
                        "requestBody": {
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/CreateBook" }
                                }
                            }
                        },
                        "responses": {
                            "303": redirect,
                            "422": { "description": "Create form view with errors" }
                        }
                    }
                },
                "/edit/{id}": {
                    "get": {
                        "summary": "Load a book for editing",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": {
                                "description": "Edit form view",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/EditBookView" }
                                    }
                                }
                            },
                            "404": error
                        }
                    },
                    "post": {
                        "summary": "Submit a sparse edit",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "requestBody": {
                            "content": {
                                "application/x-www-form-urlencoded": {
                                    "schema": { "$ref": "#/components/schemas/EditBook" }
                                }
                            }
                        },
                        "responses": {
                            "303": redirect,
                            "422": {
                                "description": "Edit form view with errors",
                                "content": {
                                    "application/json": {
                                        "schema": { "$ref": "#/components/schemas/EditBookView" }
                                    }
                                }
                            }
                        }
                    }
                },
                "/delete/{id}": {
                    "get": {
                        "summary": "Delete confirmation",
                        "tags": ["Books"],
                        "parameters": id_param,
                        "responses": {
                            "200": { "description": "Book to delete" },
                            "404": error
                        }
                    }
                },
                "/delete-confirmed": {
                    "post": {
                        "summary": "Delete a book",
                        "tags": ["Books"],
                        "responses": {
                            "303": redirect,
                            "400": error,
                            "404": error
                        }
                    }
                },
                "/health": {
                    "get": {
                        "summary": "Books health check",
                        "tags": ["Books"],
                        "responses": {
                            "200": { "description": "OK" }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "Id": { "type": "integer" },
                            "ISBN": { "type": "string" },
                            "Title": { "type": "string" },
                            "Author": { "type": "string" },
                            "Price": { "type": "number" },
                            "PressId": { "type": "integer" },
                            "LocationId": { "type": "integer" },
                            "Press": { "type": "object" },
                            "Location": { "type": "object" }
                        },
                        "required": ["Id", "ISBN", "Title", "Author", "Price", "PressId", "LocationId"]
                    },
                    "CreateBook": {
                        "type": "object",
                        "properties": {
                            "ISBN": { "type": "string" },
                            "Title": { "type": "string" },
                            "Author": { "type": "string" },
                            "Price": { "type": "string" },
                            "PressId": { "type": "string" },
                            "LocationId": { "type": "string" }
                        }
                    },
                    "EditBook": {
                        "type": "object",
                        "description": "Blank fields are left unchanged",
                        "properties": {
                            "Id": { "type": "string" },
                            "Title": { "type": "string" },
                            "Author": { "type": "string" },
                            "PressId": { "type": "string" },
                            "AddressId": { "type": "string" }
                        },
                        "required": ["Id"]
                    },
                    "EditBookView": {
                        "type": "object",
                        "properties": {
                            "Id": { "type": ["integer", "null"] },
                            "Title": { "type": ["string", "null"] },
                            "Author": { "type": ["string", "null"] },
                            "PressId": { "type": ["integer", "null"] },
                            "AddressId": { "type": ["integer", "null"] },
                            "Presses": { "type": "array", "items": { "$ref": "#/components/schemas/ReferenceOption" } },
                            "Addresses": { "type": "array", "items": { "$ref": "#/components/schemas/ReferenceOption" } },
                            "Errors": { "type": "array", "items": { "type": "object" } }
                        }
                    },
                    "ReferenceOption": {
                        "type": "object",
                        "properties": {
                            "value": { "type": "string" },
                            "label": { "type": "string" }
                        },
                        "required": ["value", "label"]
                    }
                }
            }
        }))
    }

    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(api: Arc<dyn ResourceApi>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(api))
}
