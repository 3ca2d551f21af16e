use super::{
    FormatKind, HclFormat, JsonFormat, PropertiesFormat, ProtoFormat, ResourceFormat, XmlFormat,
    YamlFormat,
};

/// Ordered collection of resource formats
///
/// Order is significant: when two formats accept the same path, the one
/// registered first claims it.
pub struct FormatRegistry {
    formats: Vec<Box<dyn ResourceFormat>>,
}

impl FormatRegistry {
    /// The built-in formats in their fixed order
    pub fn builtin() -> Self {
        Self::from_formats(vec![
            Box::new(JsonFormat),
            Box::new(XmlFormat),
            Box::new(YamlFormat),
            Box::new(PropertiesFormat),
            Box::new(ProtoFormat),
            Box::new(HclFormat),
        ])
    }

    /// Build a registry from an explicit list, keeping its order
    pub fn from_formats(formats: Vec<Box<dyn ResourceFormat>>) -> Self {
        Self { formats }
    }

    /// Append a format after the existing ones
    pub fn register(&mut self, format: impl ResourceFormat + 'static) {
        self.formats.push(Box::new(format));
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn ResourceFormat> {
        self.formats.iter().map(|format| &**format)
    }

    pub fn kinds(&self) -> Vec<FormatKind> {
        self.iter().map(|format| format.kind()).collect()
    }

    pub fn len(&self) -> usize {
        self.formats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.formats.is_empty()
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
