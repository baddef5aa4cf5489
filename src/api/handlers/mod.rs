//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod api_keys;
pub mod health;
pub mod redirect;
pub mod short_codes;

pub use api_keys::{
    create_key_handler, delete_key_handler, get_key_handler, list_keys_handler,
    update_key_handler,
};
pub use health::health_handler;
pub use redirect::redirect_handler;
pub use short_codes::{
    create_short_code_handler, delete_short_code_handler, get_short_code_by_code_handler,
    get_short_code_handler, list_short_codes_handler, update_short_code_handler,
};
