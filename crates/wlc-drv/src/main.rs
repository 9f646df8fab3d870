use std::process::ExitCode;

fn main() -> ExitCode {
    let code = wlc_drv::run(std::env::args());
    ExitCode::from(code as u8)
}
