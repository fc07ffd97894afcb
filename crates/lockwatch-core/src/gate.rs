//! Admin gate: the password-then-edit flow guarding locker updates.

use crate::auth::CredentialVerifier;
use crate::number::LockerNumber;
use crate::service::LockerService;

/// Gate position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Closed,
    PasswordEntry,
    EditForm,
}

/// State machine for the admin dialog.
///
/// All fields are local until a successful submit; dismissing at any point
/// clears them, so nothing survives a reopen.
#[derive(Debug)]
pub struct AdminGate {
    state: GateState,
    password: String,
    candidate: String,
    credential_error: bool,
    number_error: bool,
    store_error: bool,
}

impl AdminGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Closed,
            password: String::new(),
            candidate: String::new(),
            credential_error: false,
            number_error: false,
            store_error: false,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn candidate(&self) -> &str {
        &self.candidate
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn credential_error(&self) -> bool {
        self.credential_error
    }

    pub fn number_error(&self) -> bool {
        self.number_error
    }

    pub fn store_error(&self) -> bool {
        self.store_error
    }

    /// Open the dialog, pre-filling the edit field with the current number.
    ///
    /// Submitting the pre-filled value unchanged still performs a write,
    /// which is what restarts the countdown for every viewer.
    pub fn open(&mut self, current: &LockerNumber) {
        if self.state != GateState::Closed {
            return;
        }
        self.state = GateState::PasswordEntry;
        self.candidate = current.as_str().to_string();
    }

    /// Record a password keystroke. Clears only the credential error flag;
    /// the typed password itself survives a failed attempt.
    pub fn password_input(&mut self, text: impl Into<String>) {
        self.password = text.into();
        self.credential_error = false;
    }

    /// Record an edit-field keystroke. Clears the inline edit errors.
    pub fn candidate_input(&mut self, text: impl Into<String>) {
        self.candidate = text.into();
        self.number_error = false;
        self.store_error = false;
    }

    /// Submit the password. On success the edit form opens.
    ///
    /// There is no lockout: every wrong attempt independently surfaces the
    /// same inline error and leaves the gate open for another try.
    pub fn submit_password(&mut self, verifier: &dyn CredentialVerifier) -> bool {
        if self.state != GateState::PasswordEntry {
            return false;
        }

        if verifier.verify(&self.password) {
            self.state = GateState::EditForm;
            self.credential_error = false;
            true
        } else {
            self.credential_error = true;
            false
        }
    }

    /// Submit the edited number.
    ///
    /// Validates locally before touching the service; a store failure leaves
    /// the form open with nothing written and no countdown reset.
    pub fn submit_candidate(&mut self, service: &LockerService) -> bool {
        if self.state != GateState::EditForm {
            return false;
        }

        let number = match LockerNumber::parse(&self.candidate) {
            Ok(number) => number,
            Err(_) => {
                self.number_error = true;
                return false;
            }
        };

        if service.write(&number) {
            self.close();
            true
        } else {
            self.store_error = true;
            false
        }
    }

    /// Dismiss the dialog from any state, dropping all local fields.
    pub fn dismiss(&mut self) {
        self.close();
    }

    fn close(&mut self) {
        self.state = GateState::Closed;
        self.password.clear();
        self.candidate.clear();
        self.credential_error = false;
        self.number_error = false;
        self.store_error = false;
    }
}


impl Default for AdminGate {
    fn default() -> Self {
        Self::new()
    }
}
