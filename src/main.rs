use wifi_heatmap::frontend::cli::cli;


fn main() {
    cli();
}
