use escrivao_core::ReportKind;

/// What the text in the output pane was generated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Report(ReportKind),
    Oitivas,
}

impl OutputKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Report(kind) => kind.label(),
            Self::Oitivas => "Oitivas",
        }
    }

    /// File-name friendly name.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Report(kind) => kind.slug(),
            Self::Oitivas => "oitivas",
        }
    }
}
