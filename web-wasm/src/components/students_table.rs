//! 学生一覧テーブル
//!
//! クライアント側で絞り込み済みのリストを受け取って描画するだけで、
//! ここから再フェッチは行わない

use checkin_common::{format_date, ScanStatus, Student};
use leptos::prelude::*;

#[component]
pub fn StudentsTable(students: Signal<Vec<Student>>) -> impl IntoView {
    view! {
        <table class="students-table">
            <thead>
                <tr>
                    <th>"Name"</th>
                    <th>"PRN"</th>
                    <th>"Email"</th>
                    <th>"Status"</th>
                    <th>"Scanned At"</th>
                </tr>
            </thead>
            <tbody>
                <Show when=move || students.get().is_empty()>
                    <tr>
                        <td colspan="5" class="text-center text-muted">
                            "No students found"
                        </td>
                    </tr>
                </Show>
                <For
                    each=move || students.get()
                    key=|student| student.prn.clone()
                    children=move |student| {
                        let badge_class = match student.status {
                            ScanStatus::Scanned => "badge badge-success",
                            ScanStatus::Pending => "badge badge-warning",
                        };
                        let scanned_at = student
                            .scanned_at
                            .as_deref()
                            .map(format_date)
                            .unwrap_or_else(|| "-".to_string());
                        view! {
                            <tr class="student-row">
                                <td class="fw-bold">{student.name.clone()}</td>
                                <td><code>{student.prn.clone()}</code></td>
                                <td>
                                    <a href=format!("mailto:{}", student.email)>
                                        {student.email.clone()}
                                    </a>
                                </td>
                                <td>
                                    <span class=badge_class>{student.status.as_str()}</span>
                                </td>
                                <td>{scanned_at}</td>
                            </tr>
                        }
                    }
                />
            </tbody>
        </table>
    }
}
