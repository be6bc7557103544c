//! Boundary reason vocabulary.
//!
//! Every rejected operation reports one of these reasons. The text is part
//! of the compatibility surface for downstream consumers and must not change.

use std::fmt;

use serde::{Serialize, Serializer};

macro_rules! status_reasons {
    ($( $(#[$doc:meta])* $variant:ident => $key:literal, $text:literal; )*) => {
        /// A classified rejection reason.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum StatusReason {
            $( $(#[$doc])* $variant, )*
        }

        impl StatusReason {
            /// Every reason, in declaration order.
            pub const ALL: &'static [StatusReason] = &[$(StatusReason::$variant),*];

            /// The verbatim reason text.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text, )*
                }
            }

            /// Stable snake_case key used for per-kind counters.
            pub fn metric_key(&self) -> &'static str {
                match self {
                    $( Self::$variant => $key, )*
                }
            }

            /// Position of this reason within [`StatusReason::ALL`].
            pub fn index(&self) -> usize {
                *self as usize
            }
        }
    };
}

status_reasons! {
    NoUsrDetails => "no_usr_details", "No user details were given";
    InvalidUserDetails => "invalid_user_details", "Invalid user details were given";
    UserNotFound => "user_not_found", "User not found";
    ErrFindingUsr => "err_finding_usr", "Error finding user";
    ErrCreatingUsr => "err_creating_usr", "Error creating the user";
    ErrUpdatingUsr => "err_updating_usr", "Error updating user";
    UsrAlreadyExists => "usr_already_exists", "User already exists";
    ErrGeneratingToken => "err_generating_token", "Error generating the token";
    ErrUpdatingToken => "err_updating_token", "Error updating token";
    MissingUsrDetails => "missing_usr_details", "Not all required details were given";
    ErrorUpdatingPw => "error_updating_pw", "Error updating password";
    MissingIdPw => "missing_id_pw", "Missing id and/or password";
    NoMatch => "no_match", "No user matched the given details";
    NotVerified => "not_verified", "The user hasn't verified this account yet";
    NoTokenMatch => "no_token_match", "No token matched the given details";
    PwWrong => "pw_wrong", "Wrong password";
    ErrSendingEmail => "err_sending_email", "Error sending email";
    NoToken => "no_token", "No x-tidepool-session-token was found";
    ServerTokenRequired => "server_token_required", "A server token is required";
    AuthHeaderRequired => "auth_header_required", "Authorization header is required";
    /// Key spelling matches the historical counter name.
    AuthHeaderInvalid => "auth_header_invlaid", "Authorization header is invalid";
    GetstatusErr => "getstatus_err", "Error checking service status";
    Unauthorized => "unauthorized", "Not authorized for requested operation";
    NoQuery => "no_query", "A query must be specified";
    ParameterUnknown => "parameter_unknown", "Unknown query parameter";
    OneQueryParam => "one_query_param", "Only one query parameter is allowed";
    InvalidRole => "invalid_role", "The role specified is invalid";
}

impl fmt::Display for StatusReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for StatusReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}
