//! The form shared by the create and edit person pages.

use maud::{Markup, html};

use crate::{
    html::{BUTTON_PRIMARY_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE},
    person::PersonForm,
};

/// Where the form is submitted to.
pub(super) enum FormTarget<'a> {
    /// POST to create a new person.
    Create(&'a str),
    /// PUT to update an existing person.
    Update(&'a str),
}

pub(super) fn person_form_view(form: &PersonForm, target: FormTarget<'_>) -> Markup {
    let text_input = |name: &str, label: &str, type_: &str, value: &str| {
        html! {
            div
            {
                label for=(name) class=(FORM_LABEL_STYLE) { (label) }

                input
                    id=(name)
                    type=(type_)
                    name=(name)
                    value=(value)
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    };

    let number_input = |name: &str, label: &str, value: i64| {
        html! {
            div
            {
                label for=(name) class=(FORM_LABEL_STYLE) { (label) }

                input
                    id=(name)
                    type="number"
                    name=(name)
                    value=(value)
                    min="0"
                    step="1"
                    required
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    };

    let fields = html! {
        (text_input("first_name", "First Name", "text", &form.first_name))
        (text_input("last_name", "Last Name", "text", &form.last_name))
        (number_input("age", "Age", i64::from(form.age)))
        (text_input("email", "Email", "email", &form.email))
        (number_input("paid_days", "Paid Vacation Days", form.paid_days))
        (number_input("non_paid_days", "Non-Paid Leave Days", form.non_paid_days))
    };

    match target {
        FormTarget::Create(endpoint) => html! {
            form
                hx-post=(endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (fields)
                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add Person" }
            }
        },
        FormTarget::Update(endpoint) => html! {
            form
                hx-put=(endpoint)
                hx-target-error="#alert-container"
                class="w-full space-y-4 md:space-y-6"
            {
                (fields)

                p class="text-sm text-gray-500 dark:text-gray-400"
                {
                    "Changing the balances here overwrites them without creating a leave record."
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Save Person" }
            }
        },
    }
}
