fn main() -> std::process::ExitCode {
    sheet_delta_lib::run()
}
