/// Everything the user (or the clock) can ask the app to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    Tick,
    Resize(u16, u16),
    None,

    // Navigation
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    NavigateBack,

    // Operations
    Verify,
    ReportPendencias,
    ReportFinal,
    GenerateOitivas,

    // Oitiva form
    SelectPerson,
    CycleInterviewType,
    EditQuestionCount,

    // Panels
    EditUrl,
    ToggleCredentialPanel,
    EditApiKey,
    Export,
    ToggleHelp,

    // Text input
    InputChar(char),
    InputBackspace,
    InputConfirm,
    InputCancel,
    CursorLeft,
    CursorRight,
    CursorHome,
    CursorEnd,
    DeleteForward,
}
