use std::collections::HashMap;

use super::*;

#[test]
fn unrenderable_output_is_a_render_error() {
    let value: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
    let err = print_json(&value).unwrap_err();
    assert!(matches!(err, CliError::Render(_)));
    assert!(err.to_string().starts_with("failed to render output"));
}

#[test]
fn register_takes_name_and_email() {
    let cli = Cli::try_parse_from(["uamt", "register", "--name", "Demo", "--email", "demo@x.com"]).unwrap();
    assert!(matches!(cli.command, Command::Register { ref name, .. } if name == "Demo"));
}
