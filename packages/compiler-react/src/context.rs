use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

/// Options for React transpilation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranspileOptions {
    /// Factory called for every element
    pub pragma: String,
    /// Component passed to the factory for `<>...</>`
    pub pragma_frag: String,
    /// Attach `__source` props with the element's file position
    pub source_locations: bool,
    /// File name reported in `__source`
    pub file_name: String,
}

impl Default for TranspileOptions {
    fn default() -> Self {
        Self {
            pragma: "React.createElement".to_string(),
            pragma_frag: "React.Fragment".to_string(),
            source_locations: true,
            file_name: "file.tsx".to_string(),
        }
    }
}

/// Output buffer shared by the transpilation passes
pub struct CompilerContext {
    buffer: Rc<RefCell<String>>,
    pub options: TranspileOptions,
}

impl CompilerContext {
    pub fn new(options: TranspileOptions) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            options,
        }
    }

    pub fn add(&self, text: &str) {
        self.buffer.borrow_mut().push_str(text);
    }

    pub fn get_output(&self) -> String {
        self.buffer.borrow().clone()
    }

    /// A context writing to a fresh buffer with the same options
    pub fn with_new_buffer(&self) -> Self {
        Self {
            buffer: Rc::new(RefCell::new(String::new())),
            options: self.options.clone(),
        }
    }

    /// Same buffer, but no `__source` props. Used for snippets whose
    /// offsets do not map back to the file.
    pub fn without_locations(&self) -> Self {
        let mut options = self.options.clone();
        options.source_locations = false;
        Self {
            buffer: self.buffer.clone(),
            options,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.borrow().is_empty()
    }
}
