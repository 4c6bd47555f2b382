//! Static text shown in the event log.

/// Banner written once at startup (without a timestamp).
pub fn welcome_text() -> String {
    format!(
        "Welcome to REKL\n\
         v{}\n\
         \n\
         Enter \"\\help\" for a list of supported commands.\n",
        env!("CARGO_PKG_VERSION")
    )
}

pub const HELP_TEXT: &str = r#"
A command should be entered as input with no additional text on the line.
A hotkey can be used at any time without submitting the input field.
Any other inputs will be sent as CW if all characters are sendable.

    "\help"       COMMAND    Display this help text
    "\quit"       COMMAND    Exit the program
    "\clear"      COMMAND    Clear the display
    "\config"     COMMAND    Display the current configuration
    "\speed"      COMMAND    Display the current WPM speed
    "\speed N"    COMMAND    Set the CW speed to N WPM
    [Up Arrow]    HOTKEY     Increment the CW speed by 1 WPM
    [Down Arrow]  HOTKEY     Decrement the CW speed by 1 WPM
    "\N=..."      COMMAND    Save a message at memory position N
    [Shift+N]     HOTKEY     Send the message at memory position N
    "\stop"       COMMAND    Stop sending CW immediately
    [Esc]         HOTKEY     Stop sending CW immediately
"#;
