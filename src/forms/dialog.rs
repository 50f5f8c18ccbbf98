use super::FormErrors;

/// A modal container around one form.
///
/// Closing always resets the form, so reopening never shows stale input.
/// Submitting closes the dialog only when the submission succeeds.
#[derive(Debug, Clone, Default)]
pub struct Dialog<F: Default> {
    open: bool,
    form: F,
}

impl<F: Default> Dialog<F> {
    pub fn open_with(&mut self, form: F) {
        self.form = form;
        self.open = true;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.form = F::default();
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub const fn form(&self) -> &F {
        &self.form
    }

    pub const fn form_mut(&mut self) -> &mut F {
        &mut self.form
    }

    /// Converts the form with `f` without closing, for submissions that
    /// still have to reach the server.
    pub fn prepare<T>(&self, f: impl FnOnce(&F) -> Result<T, FormErrors>) -> Result<T, FormErrors> {
        if !self.open {
            return Err(FormErrors::single("dialog", "Dialog is not open"));
        }
        f(&self.form)
    }

    /// Converts the form with `f`; returns the payload and closes on
    /// success, leaves the dialog open with its input on failure.
    pub fn submit<T>(&mut self, f: impl FnOnce(&F) -> Result<T, FormErrors>) -> Result<T, FormErrors> {
        let payload = self.prepare(f)?;
        self.close();
        Ok(payload)
    }
}
