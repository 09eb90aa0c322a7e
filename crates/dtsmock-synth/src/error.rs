//! Fatal synthesis errors.

use dtsmock_common::{Diagnostic, diagnostic_codes};

/// Conditions that abort the current unit of work.
///
/// `MissingPropertyPath` aborts synthesis of one file;
/// `InconsistentGlobalDependency` aborts the global emission pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthError {
    /// An explicit `A.b.c` step has no member on its resolved base.
    MissingPropertyPath {
        property: String,
        base: String,
        file: String,
    },
    /// A `depend_on_globals` edge points at an entity that is neither ambient
    /// nor a member of an ambient declaration.
    InconsistentGlobalDependency {
        dependency: String,
        owner: String,
        file: String,
    },
}

impl SynthError {
    pub fn code(&self) -> u32 {
        match self {
            SynthError::MissingPropertyPath { .. } => diagnostic_codes::MISSING_PROPERTY_PATH,
            SynthError::InconsistentGlobalDependency { .. } => {
                diagnostic_codes::INCONSISTENT_GLOBAL_DEPENDENCY
            }
        }
    }

    /// The error as a reportable diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            SynthError::MissingPropertyPath {
                property,
                base,
                file,
            } => Diagnostic::from_code(
                file.as_str(),
                self.code(),
                &[property.as_str(), base.as_str()],
            ),
            SynthError::InconsistentGlobalDependency {
                dependency,
                owner,
                file,
            } => Diagnostic::from_code(
                file.as_str(),
                self.code(),
                &[dependency.as_str(), owner.as_str()],
            ),
        }
    }
}

impl std::fmt::Display for SynthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SynthError::MissingPropertyPath {
                property,
                base,
                file,
            } => {
                write!(f, "property '{property}' not found below '{base}' in {file}")
            }
            SynthError::InconsistentGlobalDependency {
                dependency,
                owner,
                file,
            } => {
                write!(
                    f,
                    "global dependency '{dependency}' of '{owner}' ({file}) is not an ambient declaration"
                )
            }
        }
    }
}

impl std::error::Error for SynthError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_property_path_maps_to_error_diagnostic() {
        let err = SynthError::MissingPropertyPath {
            property: "c".to_string(),
            base: "A".to_string(),
            file: "a.d.ts".to_string(),
        };
        let diag = err.to_diagnostic();
        assert!(diag.is_error());
        assert_eq!(diag.code, 9007);
        assert_eq!(diag.message_text, "Property c not found below A");
        assert!(err.to_string().contains("'c'"));
    }

    #[test]
    fn test_inconsistent_dependency_display_names_both_sides() {
        let err = SynthError::InconsistentGlobalDependency {
            dependency: "Local".to_string(),
            owner: "Shared".to_string(),
            file: "@ohos.x.d.ts".to_string(),
        };
        let text = err.to_string();
        assert!(text.contains("Local") && text.contains("Shared"));
        assert_eq!(err.code(), 9008);
    }
}
