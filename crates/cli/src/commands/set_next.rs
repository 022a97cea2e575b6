//! `chorebot set-next`: Override whose turn starts the next month.

pub async fn run(index: i64) -> Result<(), Box<dyn std::error::Error>> {
    let (_, engine) = super::load_engine()?;
    let name = engine.set_next_index(index).await?;
    println!("✅ 已設定下一個輪到的室友為：{name}");
    Ok(())
}
