//! 关键词词典
//!
//! 品牌按子串匹配（检测服务的标签名常为 "nike logo"、"amazon web services" 这类短语），
//! 技术工具按单词精确匹配。

use once_cell::sync::Lazy;
use std::collections::{BTreeSet, HashSet};

/// 已知的技术 / DevOps 工具名
pub const TECH_KEYWORDS: &[&str] = &[
    "prometheus", "grafana", "ansible", "jenkins", "docker",
    "kubernetes", "k8s", "helm", "terraform",
    "aws", "gcp", "azure", "lambda", "s3", "ec2", "rds",
    "vpc", "alb", "nlb", "eks", "gke", "aks",
    "mongodb", "mysql", "postgres", "redis", "elastic",
    "cicd", "monitoring", "observability", "ingress", "namespace",
];

/// 已知的品牌 / 公司 / 云厂商名（小写）
pub const BRAND_KEYWORDS: &[&str] = &[
    "nike", "starbucks", "coca cola", "coca-cola", "mcdonalds",
    "aws", "amazon web services", "amazon",
    "google", "gcp", "microsoft", "azure",
    "facebook", "meta", "twitter", "x",
    "apple", "ibm", "oracle", "tesla",
    "adidas", "puma", "pepsi", "netflix",
];

static TECH_SET: Lazy<HashSet<&'static str>> = Lazy::new(|| TECH_KEYWORDS.iter().copied().collect());

/// 单词是否为已知技术关键词
pub fn is_tech_keyword(token: &str) -> bool {
    TECH_SET.contains(token)
}

/// 标签中出现的全部品牌关键词
pub fn brands_in(label: &str) -> BTreeSet<String> {
    BRAND_KEYWORDS
        .iter()
        .filter(|brand| label.contains(*brand))
        .map(|brand| brand.to_string())
        .collect()
}
