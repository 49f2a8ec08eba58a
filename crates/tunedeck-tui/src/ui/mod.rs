pub(crate) mod binary_choice;
pub(crate) mod modal;
pub(crate) mod settings_table;
pub(crate) mod suggestions;
pub(crate) mod text;
