fn main() -> anyhow::Result<()> {
    k20_regs_gen::cli::run(k20_regs_gen::gen_spi_ctar)
}
