use proc_macro2::Span;
use proc_macro2_diagnostics::{Diagnostic, SpanDiagnosticExt};
use thiserror::Error;

/// Failure of the analysis of one creation site, or of the module as a whole.
#[derive(Debug, Clone, Error)]
pub enum AnalysisError {
    #[error("cannot resolve the mocked contract: {reason}")]
    UnresolvableContractType { span: Span, reason: String },

    #[error("cannot mock `{member}`: {reason}")]
    UnresolvableMemberType {
        span: Span,
        member: String,
        reason: String,
    },

    #[error("cannot mock `{member}`: {reason}")]
    UnsupportedMember {
        span: Span,
        member: String,
        reason: String,
    },

    #[error("value configured for `{member}` does not fit `{expected}`: {found}")]
    ConfiguredValueMismatch {
        span: Span,
        member: String,
        expected: String,
        found: String,
    },

    #[error("generated mock name `{name}` is used by more than one test")]
    DuplicateGeneratedName { span: Span, name: String },

    #[error("no mock specification matches `{key}`")]
    NoMatchingSpecification { span: Span, key: String },

    #[error("`{key}` mocks both `{first}` and `{second}`")]
    ConflictingContracts {
        span: Span,
        key: String,
        first: String,
        second: String,
    },
}

impl AnalysisError {
    pub fn span(&self) -> Span {
        match self {
            AnalysisError::UnresolvableContractType { span, .. }
            | AnalysisError::UnresolvableMemberType { span, .. }
            | AnalysisError::UnsupportedMember { span, .. }
            | AnalysisError::ConfiguredValueMismatch { span, .. }
            | AnalysisError::DuplicateGeneratedName { span, .. }
            | AnalysisError::NoMatchingSpecification { span, .. }
            | AnalysisError::ConflictingContracts { span, .. } => *span,
        }
    }

    fn help(&self) -> Option<&'static str> {
        match self {
            AnalysisError::UnresolvableContractType { .. } => Some(
                "mock a non-generic trait declared in this module, e.g. `Ghost::of::<dyn Trait>()`",
            ),
            AnalysisError::UnresolvableMemberType { .. } => {
                Some("return types must have a default value")
            }
            AnalysisError::UnsupportedMember { .. } => {
                Some("the mocked trait must be usable as `dyn Trait`")
            }
            AnalysisError::ConfiguredValueMismatch { .. } => None,
            AnalysisError::DuplicateGeneratedName { .. } => {
                Some("rename one of the tests or move it to another module")
            }
            AnalysisError::NoMatchingSpecification { .. } => {
                Some("mocks can only be created directly inside test functions")
            }
            AnalysisError::ConflictingContracts { .. } => {
                Some("a test function mocks a single trait, split it into several tests")
            }
        }
    }

    pub fn into_diagnostic(self) -> Diagnostic {
        let help = self.help();
        let diag = self.span().error(self.to_string());
        match help {
            Some(help) => diag.help(help),
            None => diag,
        }
    }
}

impl From<AnalysisError> for syn::Error {
    fn from(err: AnalysisError) -> Self {
        syn::Error::new(err.span(), err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = AnalysisError::UnresolvableMemberType {
            span: Span::call_site(),
            member: "f".to_owned(),
            reason: "`impl Trait` has no default value".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "cannot mock `f`: `impl Trait` has no default value"
        );

        let err = AnalysisError::NoMatchingSpecification {
            span: Span::call_site(),
            key: "samples::helper".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "no mock specification matches `samples::helper`"
        );
    }

    #[test]
    fn into_syn_error_keeps_message() {
        let err = AnalysisError::DuplicateGeneratedName {
            span: Span::call_site(),
            name: "a_b_c".to_owned(),
        };
        let syn_err: syn::Error = err.into();
        assert_eq!(
            syn_err.to_string(),
            "generated mock name `a_b_c` is used by more than one test"
        );
    }
}
