use clap::Parser;

use bmp_hider::{
    cli::{Action, Cli},
    handler::{handle_embed, handle_recover, handle_size},
};

/// 程序的主入口点
///
/// 负责初始化日志、解析命令行参数，并根据执行模式（嵌入、恢复或容量查询）
/// 将执行分派到相应的处理函数
fn main() -> anyhow::Result<()> {
    // 默认只输出警告，可通过 RUST_LOG 调整
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    // 解析命令行参数
    let cli = Cli::parse();

    match cli.into_action()? {
        Action::Embed(args) => handle_embed(args),
        Action::Recover(args) => handle_recover(args),
        Action::Size(args) => handle_size(args).map(|_| ()),
    }
}
