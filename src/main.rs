fn main() {
    qmd_semantic::cli::run();
}
