use crate::domain::ChatModel;

use super::super::Container;

pub struct ModelsController<'a> {
    container: &'a Container,
}

impl<'a> ModelsController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub fn list(&self) -> String {
        let default_model = self.container.default_model();
        let mut output = "Available models:\n\n".to_string();
        for model in ChatModel::ALL {
            let marker = if model == default_model { "*" } else { " " };
            let suffix = if model == default_model { " (default)" } else { "" };
            output.push_str(&format!("  {} {}{}\n", marker, model, suffix));
        }
        output
    }
}
