fn main() {
    std::process::exit(axprobe_lib::run())
}
