// ==========================================
// 集成测试辅助模块
// ==========================================

#![allow(dead_code)]

pub mod failing_repo;
pub mod mock_config;

pub use failing_repo::FailingCategoryRepo;
pub use mock_config::MockConfig;
