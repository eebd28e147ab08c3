fn main() -> Result<(), Box<dyn std::error::Error>> {
    codegpt::cli::main()
}
