use teamq_compiler::BackendRegistry;
use teamq_core::Colors;

pub struct BackendsArgs {
    pub color: bool,
}

pub fn run(args: BackendsArgs) {
    let colors = Colors::new(args.color);
    let registry = BackendRegistry::builtin();
    let names: Vec<&str> = registry.names().collect();
    println!("Available backends ({}):", names.len());
    for name in names {
        println!("  {}{}{}", colors.blue, name, colors.reset);
    }
}
