use assert_cmd::Command;

pub fn flagtag_cmd() -> Command {
    let mut cmd = Command::cargo_bin("flagtag").unwrap();
    cmd.env_remove("FLAGTAG_WARNINGS");
    cmd.env_remove("RUST_LOG");
    cmd
}
