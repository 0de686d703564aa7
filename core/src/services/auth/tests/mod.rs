pub(crate) mod fixtures;
mod login_tests;
mod registration_tests;
