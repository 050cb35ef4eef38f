/// An authority reference of a referencing object, e.g. EPSG:4326.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub codespace: Option<String>,
    pub code: String,
}

impl std::fmt::Display for Identifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.codespace {
            Some(codespace) => write!(f, "{}:{}", codespace, self.code),
            None => write!(f, "{}", self.code),
        }
    }
}
