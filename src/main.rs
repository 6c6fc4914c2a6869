use learnhub::{app_info::AppInfo, boot::boot};

#[tokio::main]
async fn main() {
    boot(AppInfo::current()).await;
}
