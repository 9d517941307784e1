//! User form controller: binds the page's buttons, validates and saves the
//! form, and grows the form with custom properties.

use crate::form::{FieldDescriptor, FieldKind, UserForm};
use crate::page::{Page, PageContext};
use crate::properties::{normalize_property_name, property_label, PropertyError, PropertyList};
use crate::record::{UserId, UserRecord, ADMIN_ROLE, ADMIN_ROLE_ON};
use crate::rules::PasswordRule;
use crate::store::{StoreError, UserStore};
use crate::validation::{validate, ValidationReport};

pub const CANCEL_BUTTON: &str = "cancel";
pub const SUBMIT_BUTTON: &str = "add";
pub const ADD_PROPERTY_BUTTON: &str = "addProperty";

pub const PROPERTY_PROMPT: &str = "Enter the name of the property to add";
pub const SAVE_FAILED: &str = "error while saving user data";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    Cancel,
    Submit,
    AddProperty,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Blocked(ValidationReport),
    /// Saved and redirected to this URL.
    Saved(String),
    /// The store rejected the save; the form is left as it was.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Navigated(String),
    Submitted(SubmitOutcome),
    /// The property name input is open and waits for `complete_add_property`.
    PropertyPrompt(&'static str),
}

pub struct UserFormController<S, P> {
    ctx: PageContext,
    form: UserForm,
    properties: PropertyList,
    rules: Vec<Box<dyn PasswordRule>>,
    store: S,
    page: P,
    bindings: Vec<(&'static str, UiAction)>,
    property_input_open: bool,
}

impl<S: UserStore, P: Page> UserFormController<S, P> {
    pub fn new(ctx: PageContext, form: UserForm, store: S, page: P) -> Self {
        Self {
            ctx,
            form,
            properties: PropertyList::new(),
            rules: Vec::new(),
            store,
            page,
            bindings: Vec::new(),
            property_input_open: false,
        }
    }

    /// Set up a controller for the page served under `base_path`.
    pub fn init(base_path: &str, form: UserForm, store: S, page: P) -> Self {
        Self::new(PageContext::init(base_path), form, store, page)
    }

    pub fn with_rules(mut self, rules: Vec<Box<dyn PasswordRule>>) -> Self {
        self.rules = rules;
        self
    }

    pub fn form(&self) -> &UserForm {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut UserForm {
        &mut self.form
    }

    pub fn properties(&self) -> &PropertyList {
        &self.properties
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    /// Wire the cancel, submit and add-property buttons. Not idempotent:
    /// calling it again binds every handler a second time.
    pub fn populate(&mut self) {
        self.bindings.push((CANCEL_BUTTON, UiAction::Cancel));
        self.bindings.push((SUBMIT_BUTTON, UiAction::Submit));
        self.bindings.push((ADD_PROPERTY_BUTTON, UiAction::AddProperty));
    }

    /// Run every handler bound to `element_id`, in binding order.
    pub async fn dispatch(&mut self, element_id: &str) -> Vec<ActionOutcome> {
        let actions: Vec<UiAction> = self
            .bindings
            .iter()
            .filter(|(id, _)| *id == element_id)
            .map(|(_, action)| *action)
            .collect();

        let mut outcomes = Vec::with_capacity(actions.len());
        for action in actions {
            let outcome = match action {
                UiAction::Cancel => ActionOutcome::Navigated(self.cancel()),
                UiAction::Submit => ActionOutcome::Submitted(self.submit().await),
                UiAction::AddProperty => ActionOutcome::PropertyPrompt(self.begin_add_property()),
            };
            outcomes.push(outcome);
        }
        outcomes
    }

    /// Read the identifier and every data-bearing field.
    pub fn collect(&self) -> (UserId, UserRecord) {
        let id = UserId::parse(self.form.user_id_input());
        let mut record = self.form.scan();
        let admin = if self.form.admin_checked() {
            Some(ADMIN_ROLE_ON.to_string())
        } else {
            None
        };
        record.set(ADMIN_ROLE, admin);
        (id, record)
    }

    /// Validate and save the form; redirect on success.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let (id, record) = self.collect();
        let report = validate(&record, id, &self.rules);
        report.apply(&mut self.form);
        if !report.is_ok() {
            tracing::debug!(user_id = %id, ?report, "submission blocked");
            return SubmitOutcome::Blocked(report);
        }

        match self.store.save(id.existing(), &record).await {
            Ok(()) => SubmitOutcome::Saved(self.navigate_to_user_list()),
            Err(e) => {
                tracing::warn!(user_id = %id, error = %e, "saving user failed");
                self.page.alert(SAVE_FAILED);
                SubmitOutcome::Failed(e.to_string())
            }
        }
    }

    /// Open the property name input.
    pub fn begin_add_property(&mut self) -> &'static str {
        self.property_input_open = true;
        PROPERTY_PROMPT
    }

    pub fn property_input_open(&self) -> bool {
        self.property_input_open
    }

    /// Close the property name input with what the user entered; `None`
    /// means the input was dismissed.
    pub fn complete_add_property(
        &mut self,
        input: Option<&str>,
    ) -> Result<FieldDescriptor, PropertyError> {
        self.property_input_open = false;
        let raw = input.unwrap_or("");
        // a name can also be taken by a form field outside the list, e.g. the admin checkbox
        let added = match self.form.field(&normalize_property_name(raw)) {
            Some(existing) if !raw.is_empty() => Err(PropertyError::Duplicate(existing.name.clone())),
            _ => self.properties.add(raw),
        };
        let name = match added {
            Ok(name) => name,
            Err(e) => {
                self.page.alert(&e.to_string());
                return Err(e);
            }
        };

        let field = FieldDescriptor::new(&name, FieldKind::Text, &property_label(&name));
        tracing::debug!(property = %name, element_id = %field.element_id, "property added");
        self.form.insert_after_marker(field.clone());
        Ok(field)
    }

    /// Both steps of adding a property at once.
    pub fn add_property(&mut self, input: Option<&str>) -> Result<FieldDescriptor, PropertyError> {
        self.begin_add_property();
        self.complete_add_property(input)
    }

    /// Leave without saving.
    pub fn cancel(&mut self) -> String {
        self.navigate_to_user_list()
    }

    pub fn navigate_to_user_list(&self) -> String {
        let url = self.ctx.user_list_url();
        tracing::info!(url = %url, "redirecting to user list");
        self.page.redirect(&url);
        url
    }

    /// Prefill the form from the stored record of the user being edited.
    pub async fn load(&mut self, id: u64) -> Result<(), StoreError> {
        let record = self.store.fetch(id).await?;
        for (key, _) in record.iter() {
            if key != ADMIN_ROLE {
                self.properties.register(key);
            }
        }
        self.form.set_user_id_input(&id.to_string());
        self.form.prefill(&record);
        Ok(())
    }
}
