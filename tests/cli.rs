use assert_cmd::Command;
use predicates::prelude::*;

fn yt2mp3() -> Command {
    Command::cargo_bin("yt2mp3").expect("binary builds")
}

#[test]
fn exit_at_platform_prompt_terminates_with_success() {
    yt2mp3()
        .write_stdin("exit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Select platform to download:"))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn invalid_choice_is_reported_and_loop_continues() {
    yt2mp3()
        .write_stdin("9\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid choice"))
        .stdout(predicate::str::contains("Exiting..."));
}

#[test]
fn back_returns_to_platform_selection() {
    yt2mp3()
        .write_stdin("1\nback\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Returning to platform selection..."));
}

#[test]
fn mismatched_url_prints_platform_specific_notice() {
    yt2mp3()
        .write_stdin("1\nhttps://vimeo.com/123\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invalid Youtube URL."));
}

#[test]
fn empty_url_prompts_again() {
    yt2mp3()
        .write_stdin("2\n\nexit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Enter a URL."));
}

#[test]
fn end_of_input_terminates_cleanly() {
    yt2mp3().write_stdin("").assert().success();
}

#[test]
fn platforms_subcommand_lists_both_platforms() {
    yt2mp3()
        .arg("platforms")
        .assert()
        .success()
        .stdout(predicate::str::contains("YouTube"))
        .stdout(predicate::str::contains("SoundCloud"));
}

#[test]
fn one_shot_download_rejects_unsupported_urls() {
    yt2mp3()
        .args(["download", "https://vimeo.com/123"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported URL"));
}
