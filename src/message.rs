//! Localized message catalog.
//!
//! A [`Messages`] value is resolved once at startup and passed to whatever
//! renders text. There is no process-wide cache.

use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Deserialize,
    Serialize,
    strum::Display,
    strum::EnumString,
)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    #[strum(to_string = "en-US", serialize = "en")]
    En,
    #[serde(rename = "ko-KR")]
    #[strum(to_string = "ko-KR", serialize = "ko")]
    Ko,
    #[serde(rename = "ja-JP")]
    #[strum(to_string = "ja-JP", serialize = "ja")]
    Ja,
}

impl Locale {
    /// Resolves the locale from an explicit setting, falling back to a
    /// POSIX locale string such as `ko_KR.UTF-8`.
    pub fn resolve(explicit: Option<Locale>, system: Option<&str>) -> Locale {
        if let Some(locale) = explicit {
            return locale;
        }
        let Some(system) = system else {
            return Locale::default();
        };
        let lang = system
            .split(['_', '-', '.', '@'])
            .next()
            .unwrap_or_default()
            .to_lowercase();
        match lang.as_str() {
            "ko" => Locale::Ko,
            "ja" => Locale::Ja,
            _ => Locale::En,
        }
    }

    pub fn messages(self) -> &'static Messages {
        match self {
            Locale::En => &EN,
            Locale::Ko => &KO,
            Locale::Ja => &JA,
        }
    }
}

#[derive(Debug)]
pub struct Messages {
    pub no_staged_files: &'static str,
    pub no_source_files: &'static str,
    pub no_production_source_files: &'static str,
    package_manager_is: &'static str,
    pub unknown_package_manager: &'static str,
    pub retry_command: &'static str,
    pub too_many_changes: &'static str,
    pub staged_files: &'static str,
    pub added: &'static str,
    pub deleted: &'static str,
    pub filename: &'static str,
    pub total_added: &'static str,
    pub total_deleted: &'static str,
    pub too_many_changes_label: &'static str,
    pub cannot_commit: &'static str,
    pub can_commit: &'static str,
    step_failed: &'static str,
    pub always_failing: &'static str,
    pub branch_checking: &'static str,
    pub branch_checking_error: &'static str,
    pub format_source_files: &'static str,
    pub lint_checking: &'static str,
    pub type_checking: &'static str,
    pub build_checking: &'static str,
    pub execute_test: &'static str,
}

impl Messages {
    pub fn package_manager_is(&self, pm: impl std::fmt::Display) -> String {
        self.package_manager_is.replace("{}", &pm.to_string())
    }

    pub fn step_failed(&self, name: &str) -> String {
        self.step_failed.replace("{}", name)
    }
}

static EN: Messages = Messages {
    no_staged_files: "There are no staged files. Exit.",
    no_source_files: "There are no TypeScript files. Skip some steps.",
    no_production_source_files: "There are no production TypeScript files. Skip some steps.",
    package_manager_is: "Detected Package Manager is {}",
    unknown_package_manager: "Could not detect a package manager from lockfiles, using npm",
    retry_command: "Run the first failed command again",
    too_many_changes: "Too many changes",
    staged_files: "Staged Files",
    added: "added",
    deleted: "deleted",
    filename: "filename",
    total_added: "total added",
    total_deleted: "total deleted",
    too_many_changes_label: "Too many changes!!!",
    cannot_commit: "Cannot commit",
    can_commit: "You can commit",
    step_failed: "{} failed",
    always_failing: "Always Failing (Only for testing)",
    branch_checking: "Branch Checking",
    branch_checking_error: "You are not on a safe branch. Please checkout to a safe branch",
    format_source_files: "Formatting staged files",
    lint_checking: "Lint Checking",
    type_checking: "Type Checking",
    build_checking: "Build Checking",
    execute_test: "Execute Test",
};

static KO: Messages = Messages {
    no_staged_files: "스테이징된 파일이 없어 종료합니다.",
    no_source_files: "타입스크립트 파일이 없어 일부 단계를 건너뜁니다.",
    no_production_source_files: "프로덕션 타입스크립트 파일이 없어 일부 단계를 건너뜁니다.",
    package_manager_is: "패키지 매니저는 {} 입니다.",
    unknown_package_manager: "잠금 파일에서 패키지 매니저를 찾지 못해 npm을 사용합니다.",
    retry_command: "실패한 첫 번째 명령어를 다시 실행합니다",
    too_many_changes: "너무 많은 변경이 있습니다",
    staged_files: "스테이징된 파일",
    added: "추가됨",
    deleted: "삭제됨",
    filename: "파일명",
    total_added: "총 추가됨",
    total_deleted: "총 삭제됨",
    too_many_changes_label: "너무 많은 변경이 있습니다!!!",
    cannot_commit: "커밋할 수 없습니다",
    can_commit: "커밋할 수 있습니다",
    step_failed: "{} 에 실패했습니다",
    always_failing: "항상 실패 (테스트용)",
    branch_checking: "브랜치 확인",
    branch_checking_error: "위험한 브랜치에 커밋을 하고 있습니다. 다른 브랜치에서 작업해 주세요",
    format_source_files: "스테이징된 파일들을 포맷팅합니다",
    lint_checking: "린트 체크",
    type_checking: "타입 체크",
    build_checking: "빌드 체크",
    execute_test: "테스트 실행",
};

static JA: Messages = Messages {
    no_staged_files: "ステージングされたファイルがないので、終了します。",
    no_source_files: "TypeScriptファイルがないので、一部のステップをスキップします。",
    no_production_source_files: "プロダクションTypeScriptファイルがないので、一部のステップをスキップします。",
    package_manager_is: "パッケージマネージャーは{}です。",
    unknown_package_manager: "ロックファイルからパッケージマネージャーを検出できないため、npmを使用します。",
    retry_command: "最初に失敗したコマンドを再実行します",
    too_many_changes: "多すぎる変更",
    staged_files: "ステージングされたファイル",
    added: "追加",
    deleted: "削除",
    filename: "ファイル名",
    total_added: "合計追加",
    total_deleted: "合計削除",
    too_many_changes_label: "多すぎる変更があります!!!",
    cannot_commit: "コミットできません",
    can_commit: "コミットできます",
    step_failed: "{} に失敗しました",
    always_failing: "常に失敗 (テスト用)",
    branch_checking: "ブランチ確認",
    branch_checking_error: "危険なブランチでコミットしています。安全なブランチにチェックアウトしてください",
    format_source_files: "ステージングされたファイルをフォーマットします",
    lint_checking: "リントチェック",
    type_checking: "型チェック",
    build_checking: "ビルドチェック",
    execute_test: "テスト実行",
};
