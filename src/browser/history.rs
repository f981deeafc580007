// Session history - entries and the current position

#[derive(Clone, Debug)]
pub struct History {
    entries: Vec<String>,
    index: usize,
}

impl History {
    pub fn new(start_href: String) -> Self {
        Self {
            entries: vec![start_href],
            index: 0,
        }
    }

    pub fn current(&self) -> &str {
        &self.entries[self.index]
    }

    pub fn push(&mut self, href: String) {
        // Remove any forward history when navigating to a new entry
        self.entries.truncate(self.index + 1);
        self.entries.push(href);
        self.index += 1;
    }

    pub fn replace(&mut self, href: String) {
        self.entries[self.index] = href;
    }

    pub fn back(&mut self) -> Option<&str> {
        if self.index > 0 {
            self.index -= 1;
            Some(self.current())
        } else {
            None
        }
    }

    pub fn forward(&mut self) -> Option<&str> {
        if self.index + 1 < self.entries.len() {
            self.index += 1;
            Some(self.current())
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }
}
