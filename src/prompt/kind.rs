#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromptKind {
    Command,
    PhysicalDistance,
    DesiredScale,
}

impl PromptKind {
    pub fn id(self) -> &'static str {
        match self {
            Self::Command => "command",
            Self::PhysicalDistance => "distance",
            Self::DesiredScale => "scale",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Command => "Command",
            Self::PhysicalDistance => "Physical distance (ft)",
            Self::DesiredScale => "Desired scale (ft per inch)",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "command" => Some(Self::Command),
            "distance" => Some(Self::PhysicalDistance),
            "scale" => Some(Self::DesiredScale),
            _ => None,
        }
    }
}
