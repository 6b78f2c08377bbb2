pub mod boll_config;
pub mod settings_form;
