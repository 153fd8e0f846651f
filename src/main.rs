//! NeonShell binary: mount, run the tick loop, restore the terminal.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    match shell_main() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("neon-shell: {err}");
            ExitCode::FAILURE
        }
    }
}

fn shell_main() -> io::Result<()> {
    let handle = neon_shell::mount()?;
    neon_shell::run(&handle)?;
    handle.unmount()
}
