use crate::{Envelope, LineString};

/// A collection of [`LineString`]s.
#[derive(Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MultiLineString(pub Vec<LineString>);

impl MultiLineString {
    pub fn new(line_strings: Vec<LineString>) -> Self {
        MultiLineString(line_strings)
    }

    pub fn empty() -> Self {
        MultiLineString(Vec::new())
    }

    pub fn iter(&self) -> impl Iterator<Item = &LineString> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(LineString::is_empty)
    }

    /// True iff non-empty and every member is closed.
    pub fn is_closed(&self) -> bool {
        !self.is_empty() && self.0.iter().all(LineString::is_closed)
    }

    pub fn envelope(&self) -> Envelope {
        let mut env = Envelope::null();
        for ls in &self.0 {
            env.expand_to_include_envelope(&ls.envelope());
        }
        env
    }
}

impl From<Vec<LineString>> for MultiLineString {
    fn from(line_strings: Vec<LineString>) -> Self {
        MultiLineString(line_strings)
    }
}
