//! Command handlers. Each returns the text to print on stdout.

mod configuration;

pub(crate) use configuration::{
    handle_apply, handle_forget, handle_import, handle_read, handle_show, handle_validate,
};
