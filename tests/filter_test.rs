mod common;

use common::{FakeTools, LISTING};

fn data_lines(args: &[&str]) -> Vec<String> {
    let tools = FakeTools::with_listing(LISTING);
    let output = tools.cmd().args(args).assert().success().get_output().stdout.clone();
    String::from_utf8(output)
        .unwrap()
        .lines()
        .skip(1)
        .map(String::from)
        .collect()
}

#[test]
fn test_pid_filter_include() {
    let lines = data_lines(&["-p", "200"]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("sshd"));
}

#[test]
fn test_pid_filter_exclude() {
    let lines = data_lines(&["-p", "^100"]);
    assert_eq!(lines.len(), 3);
    assert!(lines.iter().all(|l| !l.contains("nginx")));
}

#[test]
fn test_user_filter() {
    let lines = data_lines(&["-u", "dev"]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("curl"));
}

#[test]
fn test_command_prefix_filter() {
    let lines = data_lines(&["-c", "ngi"]);
    assert_eq!(lines.len(), 2);
}

#[test]
fn test_listen_only() {
    let lines = data_lines(&["-l"]);
    let ports: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(ports, vec!["22", "80", "443"]);
}

#[test]
fn test_port_filter() {
    let lines = data_lines(&["--port", "443"]);
    assert_eq!(lines.len(), 1);
    assert!(lines[0].starts_with("443"));
}

#[test]
fn test_filters_are_anded() {
    let lines = data_lines(&["-u", "root", "--port", "^80", "-l"]);
    let ports: Vec<&str> = lines
        .iter()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(ports, vec!["22", "443"]);
}

#[test]
fn test_invalid_filter_rejected() {
    let tools = FakeTools::with_listing(LISTING);
    tools.cmd().args(["-p", "abc"]).assert().code(1);
}
