use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sdkman,
    Nvm,
}

impl BackendKind {
    /// Menu order: SDKMAN families first, then Node.
    pub const ALL: [Self; 2] = [Self::Sdkman, Self::Nvm];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sdkman => "sdkman",
            Self::Nvm => "nvm",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sdkman" => Some(Self::Sdkman),
            "nvm" => Some(Self::Nvm),
            _ => None,
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::BackendKind;

    #[test]
    fn sdkman_precedes_nvm_in_menu_order() {
        assert_eq!(BackendKind::ALL, [BackendKind::Sdkman, BackendKind::Nvm]);
    }

    #[test]
    fn from_name_round_trips_known_names() {
        for kind in BackendKind::ALL {
            assert_eq!(BackendKind::from_name(kind.as_str()), Some(kind));
        }
        assert_eq!(BackendKind::from_name("SDKMAN"), None);
        assert_eq!(BackendKind::from_name("pyenv"), None);
    }

    #[test]
    fn display_outputs_backend_name() {
        assert_eq!(BackendKind::Sdkman.to_string(), "sdkman");
        assert_eq!(BackendKind::Nvm.to_string(), "nvm");
    }
}
