//! 定期リフレッシュヘルパー
//!
//! 一定間隔でコールバックを呼ぶ。タブが非表示の間はtickごとの呼び出しを
//! スキップするが、タイマー自体は止めない。実行中コールバックの完了は
//! 待たない（読み取り専用フェッチなので多重実行を許容する）

use gloo::timers::callback::Interval;
use std::rc::Rc;
use web_sys::VisibilityState;

pub struct PeriodicRefresh {
    interval_ms: u32,
    callback: Rc<dyn Fn()>,
    timer: Option<Interval>,
}

impl PeriodicRefresh {
    pub fn new(interval_ms: u32, callback: impl Fn() + 'static) -> Self {
        Self {
            interval_ms,
            callback: Rc::new(callback),
            timer: None,
        }
    }

    /// 開始。既に動作中なら何もしない
    pub fn start(&mut self) {
        if self.timer.is_some() {
            return;
        }
        let callback = self.callback.clone();
        self.timer = Some(Interval::new(self.interval_ms, move || {
            if page_is_visible() {
                callback();
            }
        }));
    }

    /// 停止（冪等）
    pub fn stop(&mut self) {
        self.timer = None;
    }

    pub fn restart(&mut self) {
        self.stop();
        self.start();
    }

    pub fn is_active(&self) -> bool {
        self.timer.is_some()
    }

    /// タイマーを破棄せず動かし続ける
    ///
    /// ページ生存中ずっとポーリングする用途ではハンドルを持ち回る必要がない
    pub fn forget(mut self) {
        if let Some(timer) = self.timer.take() {
            timer.forget();
        }
    }
}

fn page_is_visible() -> bool {
    web_sys::window()
        .and_then(|w| w.document())
        .map(|d| d.visibility_state() == VisibilityState::Visible)
        .unwrap_or(false)
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use gloo::timers::future::TimeoutFuture;
    use std::cell::Cell;
    use std::rc::Rc;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn start_is_idempotent_and_stop_cancels() {
        let mut refresh = PeriodicRefresh::new(1_000, || {});
        assert!(!refresh.is_active());

        refresh.start();
        refresh.start();
        assert!(refresh.is_active());

        refresh.stop();
        refresh.stop();
        assert!(!refresh.is_active());

        refresh.restart();
        assert!(refresh.is_active());
    }

    #[wasm_bindgen_test]
    async fn ticks_while_visible_and_stops_after_stop() {
        let count = Rc::new(Cell::new(0u32));
        let mut refresh = PeriodicRefresh::new(10, {
            let count = count.clone();
            move || count.set(count.get() + 1)
        });

        refresh.start();
        TimeoutFuture::new(100).await;
        refresh.stop();

        // ヘッドレスブラウザではページはvisible扱い
        assert!(count.get() >= 1);

        let after_stop = count.get();
        TimeoutFuture::new(50).await;
        assert_eq!(count.get(), after_stop);
    }
}
