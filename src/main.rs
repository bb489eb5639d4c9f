fn main() {
  std::process::exit(react_analyzer::cli::run());
}
