/// Ordered set of selected section ids. Position is selection order and is
/// what the UI numbers its badges with.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SelectionTracker {
    ids: Vec<String>,
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `id` if absent, remove it if present. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.position(id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    /// 1-based display number.
    pub fn ordinal(&self, id: &str) -> Option<usize> {
        self.position(id).map(|p| p + 1)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.ids.iter().position(|s| s == id)
    }
}
