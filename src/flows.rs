/// Production flow definitions
///
/// The three wizard flows the brand's auth pages ship: account signup,
/// the company-signup shortcut baked into it, and password reset.

use crate::otp::RESET_CODE_LEN;
use crate::roles::Role;
use crate::validate::{FieldKind, PasswordPolicy};
use crate::wizard::definition::{StepSpec, WizardDefinition};
use rand::Rng;

pub const SIGNUP_FLOW: &str = "signup";
pub const PASSWORD_RESET_FLOW: &str = "passwordReset";

/// Three-step account signup: identity, contact, security.
///
/// The password policy is the caller's pick; the site ships both a
/// strict and a relaxed variant of "create account". Choosing the
/// `Company` role bypasses the whole flow and redirects to the company
/// signup page instead.
pub fn signup(policy: PasswordPolicy) -> WizardDefinition {
    WizardDefinition::new(
        SIGNUP_FLOW,
        vec![
            StepSpec::new("identity")
                .field("firstName", FieldKind::RequiredText)
                .field("lastName", FieldKind::RequiredText)
                .field("email", FieldKind::Email),
            StepSpec::new("contact")
                .field("phone", FieldKind::RequiredText)
                .field("country", FieldKind::RequiredText),
            StepSpec::new("security")
                .field("password", FieldKind::Password(policy))
                .field(
                    "confirm",
                    FieldKind::ConfirmPassword {
                        pair: "password".to_string(),
                    },
                )
                .field("terms", FieldKind::RequiredText),
        ],
    )
    .redirect_role(Role::Company, "signupCompany")
}

/// Four-stage password reset: request a code, verify it, set the new
/// password, confirmation. Requesting the code triggers the simulated
/// mail send, so that stage is deferred; the confirmation stage has no
/// fields and its forward action is navigation-only, landing on the
/// login page.
pub fn password_reset() -> WizardDefinition {
    let mut verify = StepSpec::new("verify");
    for slot in 0..RESET_CODE_LEN {
        verify = verify.field(format!("otp{slot}"), FieldKind::OtpDigit);
    }

    WizardDefinition::new(
        PASSWORD_RESET_FLOW,
        vec![
            StepSpec::new("request")
                .field("email", FieldKind::Email)
                .deferred(),
            verify,
            StepSpec::new("reset")
                .field("password", FieldKind::Password(PasswordPolicy::STRICT))
                .field(
                    "confirm",
                    FieldKind::ConfirmPassword {
                        pair: "password".to_string(),
                    },
                ),
            StepSpec::new("done"),
        ],
    )
    .completion_redirect("login")
}

/// Random code standing in for the emailed reset token.
pub fn issue_reset_code() -> String {
    let mut rng = rand::thread_rng();
    (0..RESET_CODE_LEN)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}
