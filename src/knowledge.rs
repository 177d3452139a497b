//! 校史知识库：系统提示词中注入的固定事实文本。
//!
//! Knowledge preamble and the instruction template it is interpolated into.

use crate::{Error, Result};
use std::path::Path;
use std::sync::Arc;

/// Built-in factual preamble.
pub const DEFAULT_KNOWLEDGE: &str = "\
东北师范大学校史要点：
- 1946年2月，学校在本溪创建，初名东北大学，是中国共产党在东北地区创建的第一所综合性大学。
- 1948年学校迁至吉林，1949年迁至长春。
- 1950年4月，东北大学更名为东北师范大学。
- 1958年至1980年曾更名为吉林师范大学，1980年恢复东北师范大学校名。
- 学校现有本部校区和净月校区两个校区，均位于吉林省长春市。
- 校训：勤奋创新，为人师表。
- 学校是教育部直属的国家“双一流”建设高校。";

/// Suggested questions offered by the front-end.
pub const QUICK_QUESTIONS: [&str; 4] = [
    "东北师范大学成立于哪一年？",
    "学校有哪些校区？",
    "校训是什么？",
    "有哪些重点学科？",
];

/// Immutable factual text embedded in every request's system part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KnowledgePreamble(Arc<str>);

impl KnowledgePreamble {
    pub fn new(text: impl AsRef<str>) -> Result<Self> {
        let text = text.as_ref();
        if text.trim().is_empty() {
            return Err(Error::configuration_field(
                "knowledge preamble must not be empty",
                "knowledge_file",
            ));
        }
        Ok(Self(Arc::from(text)))
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::new(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Render the system instruction with this preamble interpolated verbatim.
    pub fn system_prompt(&self) -> String {
        format!(
            "你是东北师范大学校史权威问答助手，严格遵守以下规则：
1. 仅基于以下知识库中的事实性校史信息回答，禁止涉及任何校史外内容；
2. 回答简洁明了，关键信息（时间、地点、人物）准确无误；
3. 知识库中没有的信息，回复“该校史信息暂未收录”；
4. 无关问题回复：“请询问东北师范大学的校史相关问题（如建校时间、发展历程等）。”
5. 禁止使用\"搜索\"、\"查询\"等涉及工具调用的表述，直接基于提供的知识库回答。

知识库内容：
{}
",
            self.0
        )
    }
}

impl Default for KnowledgePreamble {
    fn default() -> Self {
        Self(Arc::from(DEFAULT_KNOWLEDGE))
    }
}
