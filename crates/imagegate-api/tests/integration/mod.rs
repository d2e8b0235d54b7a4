mod auth_status;
mod list_images;
mod ui_config;
