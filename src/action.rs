use crate::fleet::ControlField;

/// Actions that can be performed in the application
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Navigation
    Up,
    Down,
    Left,
    Right,
    Top,
    Bottom,
    PageUp,
    PageDown,

    // Search text on the active control surface
    StartSearch,
    SearchInput(char),
    SearchBackspace,
    EndSearch,
    CancelSearch,

    // Select controls
    CycleField(ControlField),
    ToggleSortDirection,

    // Mobile filter menu
    OpenFilterMenu,
    MenuActivate,

    // Presentation
    ToggleSurface,
    ToggleTheme,
    SwitchView,

    // Compose
    OpenStackCompose,
    OpenSelectedFile,

    // Modals
    ShowHelp,
    CloseModal,

    // App control
    Refresh,
    Quit,

    // No action
    None,
}
