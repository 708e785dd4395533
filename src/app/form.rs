//! Text input buffers for the add form and the create-group prompt.

/// A single-line text buffer. Editing always happens at the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextField {
    value: String,
}

impl TextField {
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn push(&mut self, c: char) {
        self.value.push(c);
    }

    pub fn pop(&mut self) {
        self.value.pop();
    }

    pub fn clear(&mut self) {
        self.value.clear();
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.value.trim().is_empty()
    }
}

/// Index of the url field.
pub const URL_FIELD: usize = 0;
/// Index of the alias field.
pub const NAME_FIELD: usize = 1;
/// Index of the version field.
pub const VERSION_FIELD: usize = 2;

const FIELD_COUNT: usize = 3;

/// Labels and placeholders, in focus order.
pub const FIELD_PROMPTS: [(&str, &str); FIELD_COUNT] = [
    ("URL", "github.com/user/repo"),
    ("Alias", "derived from the url when empty"),
    ("Version", "latest"),
];

/// The add-package form: three fields plus the install and force toggles.
///
/// # Example
///
/// ```
/// use modstash::app::form::AddForm;
///
/// let mut form = AddForm::default();
/// for c in "github.com/acme/tool".chars() {
///     form.focused_mut().push(c);
/// }
/// form.next_field();
/// assert_eq!(form.focus(), 1);
/// assert_eq!(form.url(), "github.com/acme/tool");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddForm {
    fields: [TextField; FIELD_COUNT],
    focus: usize,
    pub install: bool,
    pub force: bool,
}

impl AddForm {
    #[must_use]
    pub const fn focus(&self) -> usize {
        self.focus
    }

    #[must_use]
    pub const fn on_last_field(&self) -> bool {
        self.focus == FIELD_COUNT - 1
    }

    /// Moves focus forward, wrapping to the first field.
    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FIELD_COUNT;
    }

    /// Moves focus backward, wrapping to the last field.
    pub fn prev_field(&mut self) {
        self.focus = (self.focus + FIELD_COUNT - 1) % FIELD_COUNT;
    }

    pub fn focused_mut(&mut self) -> &mut TextField {
        &mut self.fields[self.focus]
    }

    #[must_use]
    pub fn field(&self, index: usize) -> Option<&TextField> {
        self.fields.get(index)
    }

    #[must_use]
    pub fn url(&self) -> &str {
        self.fields[URL_FIELD].value().trim()
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.fields[NAME_FIELD].value().trim()
    }

    #[must_use]
    pub fn version(&self) -> &str {
        self.fields[VERSION_FIELD].value().trim()
    }

    /// Clears every field and toggle and focuses the url field.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn focus_wraps_both_ways() {
        let mut form = AddForm::default();
        form.prev_field();
        assert_eq!(form.focus(), VERSION_FIELD);
        assert!(form.on_last_field());
        form.next_field();
        assert_eq!(form.focus(), URL_FIELD);
    }

    #[test]
    fn reset_clears_everything() {
        let mut form = AddForm::default();
        form.focused_mut().push('x');
        form.next_field();
        form.install = true;
        form.force = true;

        form.reset();

        assert_eq!(form, AddForm::default());
    }

    #[test]
    fn text_field_edits_at_end() {
        let mut field = TextField::default();
        field.push('a');
        field.push('b');
        field.pop();
        assert_eq!(field.value(), "a");
        field.clear();
        assert!(field.is_blank());
    }
}
