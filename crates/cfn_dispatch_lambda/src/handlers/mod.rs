pub mod custom_resource;
pub mod template_macro;
