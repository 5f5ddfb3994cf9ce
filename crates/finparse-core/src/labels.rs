//! Localized strings written into record content.
//!
//! Downstream stages split `content` on these markers, so their wording is
//! part of the output format.

pub fn page_marker(page: usize) -> String {
    format!("=== 第{page}页 ===")
}

pub fn ocr_page_marker(page: usize) -> String {
    format!("=== 第{page}页(OCR) ===")
}

pub fn sheet_marker(sheet: &str) -> String {
    format!("=== 工作表: {sheet} ===")
}

pub fn slide_marker(slide: usize) -> String {
    format!("=== 幻灯片 {slide} ===")
}

pub fn chart_label(name: &str) -> String {
    if name.is_empty() {
        "图表".to_string()
    } else {
        format!("图表: {name}")
    }
}

pub fn sheet_summary(sheet: &str, data_rows: usize, header: &[String]) -> String {
    format!(
        "工作表'{sheet}'包含{data_rows}行数据，列标题: {}",
        header.join(", ")
    )
}

pub fn scanned_page_description(page: usize) -> String {
    format!("第{page}页扫描图像")
}

pub const ORIGINAL_IMAGE_DESCRIPTION: &str = "原始图像";

pub fn file_not_found(path: &str) -> String {
    format!("文件未找到: {path}")
}

pub fn unsupported_format(ext: &str) -> String {
    format!("不支持的文件格式: {ext}")
}

pub fn extraction_failed(path: &str) -> String {
    format!("文档解析失败: {path}")
}
