pub mod prompt_processing;
