pub mod oitiva;
pub mod output;
pub mod text_field;
