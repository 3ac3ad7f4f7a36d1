// End-to-end command sessions driven through the Session API

use pagesim::repl::{Session, SessionStatus};

/// Run a sequence of command lines through one session (page size 1024) and
/// return everything it printed.
fn run_session(lines: &[&str]) -> String {
    let mut session = Session::new(1024);
    let mut out = Vec::new();
    for line in lines {
        session
            .handle_line(line, &mut out)
            .expect("session I/O failed");
    }
    String::from_utf8(out).expect("non-UTF8 session output")
}

#[test]
fn test_create_prints_pid() {
    let out = run_session(&["create 100 50", "create 200 10"]);
    assert_eq!(out, "1024\n1025\n");
}

#[test]
fn test_allocate_prints_virtual_address() {
    let out = run_session(&["create 100 50", "allocate 1024 x int 10"]);
    assert_eq!(out, "1024\n65686\n");
}

#[test]
fn test_freed_hole_is_reused() {
    let out = run_session(&[
        "create 100 50",
        "allocate 1024 x int 10",
        "free 1024 x",
        "allocate 1024 y int 10",
    ]);
    assert_eq!(out, "1024\n65686\n65686\n");
}

#[test]
fn test_print_variable_truncates_after_four() {
    let out = run_session(&[
        "create 100 50",
        "allocate 1024 x int 5",
        "set 1024 x 0 1 2 3 4 5",
        "print 1024:x",
    ]);
    assert!(out.ends_with("1, 2, 3, 4, ... [5 items]\n"), "got: {}", out);
}

#[test]
fn test_print_variable_short_array() {
    let out = run_session(&[
        "create 100 50",
        "allocate 1024 v long 3",
        "set 1024 v 0 10 20 30",
        "print 1024:v",
    ]);
    assert!(out.ends_with("10, 20, 30\n"), "got: {}", out);
}

#[test]
fn test_set_with_offset_and_char_values() {
    let out = run_session(&[
        "create 100 50",
        "allocate 1024 s char 4",
        "set 1024 s 1 h i",
        "print 1024:s",
    ]);
    // Offsets 0 and 3 were never written and still hold zero bytes
    assert!(out.ends_with("\u{0}, h, i, \u{0}\n"), "got: {:?}", out);
}

#[test]
fn test_set_errors_match_the_contract() {
    let out = run_session(&["create 100 50", "set 9999 x 0 1", "set 1024 nope 0 1"]);
    assert_eq!(
        out,
        "1024\nerror: process not found\nerror: variable not found\n"
    );
}

#[test]
fn test_bad_value_leaves_variable_untouched() {
    let out = run_session(&[
        "create 100 50",
        "allocate 1024 x int 3",
        "set 1024 x 0 7 8 9",
        "set 1024 x 0 1 oops 3",
        "print 1024:x",
    ]);
    assert!(out.contains("error: invalid int value 'oops'"), "got: {}", out);
    assert!(out.ends_with("7, 8, 9\n"), "got: {}", out);
}

#[test]
fn test_print_mmu_table_format() {
    let out = run_session(&["create 100 50", "print mmu"]);
    let expected = concat!(
        "1024\n",
        " PID  | Variable Name | Virtual Addr | Size\n",
        "------+---------------+--------------+------------\n",
        " 1024 | <TEXT>        |  0x00000000  |        100 \n",
        " 1024 | <GLOBALS>     |  0x00000064  |         50 \n",
        " 1024 | <STACK>       |  0x00000096  |      65536 \n",
    );
    assert_eq!(out, expected);
}

#[test]
fn test_print_mmu_hides_free_space() {
    let out = run_session(&[
        "create 100 50",
        "allocate 1024 x int 10",
        "free 1024 x",
        "print mmu",
    ]);
    assert!(!out.contains("<FREE_SPACE>"), "got: {}", out);
    assert!(!out.contains(" x "), "got: {}", out);
}

#[test]
fn test_print_page_reports_keys_one_based() {
    let out = run_session(&["create 100 50", "print page"]);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[1], " PID  | Page Number | Frame Number");
    assert_eq!(lines[2], "------+-------------+--------------");
    // Pages 0..=64 are mapped; keys print one lower than stored
    assert_eq!(lines[3], " 1024 |          -1 |            0 ");
    assert_eq!(lines.last().copied(), Some(" 1024 |          63 |           64 "));
    assert_eq!(lines.len(), 3 + 65);
}

#[test]
fn test_print_page_sorted_by_pid_then_page() {
    let out = run_session(&["create 0 0", "create 0 0", "print page"]);
    // Two pids printed by create, then the two header rows
    let rows: Vec<(u32, i64)> = out
        .lines()
        .skip(4)
        .map(|line| {
            let mut cols = line.split('|').map(str::trim);
            let pid = cols.next().expect("pid column").parse().expect("pid");
            let page = cols.next().expect("page column").parse().expect("page");
            (pid, page)
        })
        .collect();
    let mut sorted = rows.clone();
    sorted.sort();
    assert_eq!(rows, sorted);
    assert!(rows.iter().any(|&(pid, _)| pid == 1025));
}

#[test]
fn test_terminate_removes_process_and_pages() {
    let out = run_session(&[
        "create 100 50",
        "create 100 50",
        "terminate 1024",
        "print processes",
        "print page",
    ]);
    let lines: Vec<&str> = out.lines().collect();
    // Only pid 1025 survives
    assert_eq!(lines[2], "1025");
    assert!(!lines[3..].iter().any(|line| line.starts_with(" 1024 ")));
}

#[test]
fn test_errors_keep_the_session_alive() {
    let out = run_session(&[
        "create 100 50",
        "free 1024 ghost",
        "terminate 4096",
        "defragment",
        "allocate 1024 x int 10",
    ]);
    assert_eq!(
        out,
        concat!(
            "1024\n",
            "error: variable not found\n",
            "error: process not found\n",
            "error: unknown command 'defragment'\n",
            "65686\n",
        )
    );
}

#[test]
fn test_exit_and_blank_lines() {
    let mut session = Session::new(1024);
    let mut out = Vec::new();
    assert_eq!(
        session.handle_line("", &mut out).expect("io"),
        SessionStatus::Continue
    );
    assert_eq!(
        session.handle_line("create 100 50", &mut out).expect("io"),
        SessionStatus::Continue
    );
    assert_eq!(
        session.handle_line("exit", &mut out).expect("io"),
        SessionStatus::Exit
    );
    assert_eq!(String::from_utf8(out).expect("utf8"), "1024\n");
}

#[test]
fn test_run_loop_prompts_until_exit() {
    let input = std::io::Cursor::new("create 100 50\nexit\nterminate 1024\n");
    let mut out = Vec::new();
    let mut session = Session::new(1024);
    session.run(input, &mut out).expect("run failed");
    // The line after exit is never read, and every read line gets a prompt
    assert_eq!(String::from_utf8(out).expect("utf8"), "> 1024\n> ");
    assert_eq!(session.simulator().registry().processes().len(), 1);
}

#[test]
fn test_bootstrap_segments_allocate_silently() {
    // A user-issued allocate that reuses a reserved name also stays silent
    let out = run_session(&["create 100 50", "allocate 1024 <TEXT> char 8"]);
    assert_eq!(out, "1024\n");
}
