// pagesim: interactive virtual memory management simulator

use std::io;

use pagesim::repl::Session;

fn main() -> io::Result<()> {
    // Parse command-line arguments
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        let program_name = args.first().map(|s| s.as_str()).unwrap_or("pagesim");
        eprintln!("Error: you must specify the page size");
        eprintln!();
        eprintln!("Usage: {} <page_size>", program_name);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} 1024        # 1 KiB pages", program_name);
        std::process::exit(1);
    }

    let page_size: u32 = match args[1].parse() {
        Ok(n) if n > 0 => n,
        _ => {
            eprintln!("Error: invalid page size '{}'", args[1]);
            std::process::exit(1);
        }
    };

    print_start_message(page_size);

    let stdin = io::stdin();
    let mut session = Session::new(page_size);
    session.run(stdin.lock(), io::stdout())
}

fn print_start_message(page_size: u32) {
    println!(
        "Welcome to the Memory Allocation Simulator! Using a page size of {} bytes.",
        page_size
    );
    println!("Commands:");
    println!("  * create <text_size> <data_size> (initializes a new process)");
    println!("  * allocate <PID> <var_name> <data_type> <number_of_elements> (allocates memory on the heap)");
    println!("  * set <PID> <var_name> <offset> <value_0> <value_1> <value_2> ... <value_N> (set the value for a variable)");
    println!("  * free <PID> <var_name> (deallocate memory on the heap that is associated with <var_name>)");
    println!("  * terminate <PID> (kill the specified process)");
    println!("  * print <object> (prints data)");
    println!("    * If <object> is \"mmu\", print the MMU memory table");
    println!("    * if <object> is \"page\", print the page table");
    println!("    * if <object> is \"processes\", print a list of PIDs for processes that are still running");
    println!("    * if <object> is a \"<PID>:<var_name>\", print the value of the variable for that process");
    println!();
}
