use serde::Serialize;

/// Demo work item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Model {
    id: usize,
    name: String,
    description: String,
    value: u64,
}

impl Model {
    pub fn new(id: usize, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
            value: 0,
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn value(&self) -> u64 {
        self.value
    }

    /// Copy of this model carrying `value`; `self` is left unchanged.
    pub fn with_value(&self, value: u64) -> Self {
        Self {
            value,
            ..self.clone()
        }
    }
}
