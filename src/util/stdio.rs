//! 无锁、无缓冲的标准错误输出
//!
//! 标准库的 `Stderr` 内部持有可重入锁，在信号处理函数中使用可能自锁，
//! 因此这里直接调用 `write(2)`。

/// 只追加字节、从不失败的输出端
///
/// 横幅渲染只依赖这个 trait，因此测试可以用内存缓冲区替换真实的 stderr。
pub trait RawWrite {
    /// 写出全部字节，错误被静默丢弃
    fn write_raw(&mut self, bytes: &[u8]);

    /// 写出字符串
    fn write_str_raw(&mut self, s: &str) {
        self.write_raw(s.as_bytes());
    }
}

/// 文件描述符 2 的直接写入器
#[derive(Debug, Clone, Copy, Default)]
pub struct Stderr;

impl RawWrite for Stderr {
    fn write_raw(&mut self, bytes: &[u8]) {
        write_all_fd(libc::STDERR_FILENO, bytes);
    }
}

/// 循环调用 `write(2)` 直到写完、出错或流被关闭
///
/// 被信号打断 (EINTR) 时重试，其余错误直接放弃。只调用异步信号安全的函数。
pub fn write_all_fd(fd: libc::c_int, mut bytes: &[u8]) {
    while !bytes.is_empty() {
        // SAFETY: 指针和长度来自同一个有效切片
        let written = unsafe { libc::write(fd, bytes.as_ptr().cast(), bytes.len()) };
        if written < 0 {
            if super::sys::last_errno() == libc::EINTR {
                continue;
            }
            return;
        }
        if written == 0 {
            return;
        }
        bytes = &bytes[written as usize..];
    }
}

/// stderr 是否连接到终端
pub fn stderr_is_tty() -> bool {
    // SAFETY: isatty 只查询文件描述符
    unsafe { libc::isatty(libc::STDERR_FILENO) == 1 }
}

/// 定长的内存输出端
///
/// 超出容量的部分被截断，不会分配内存。
pub struct FixedBuf<const N: usize> {
    buf: [u8; N],
    len: usize,
}

impl<const N: usize> FixedBuf<N> {
    /// 创建空缓冲区
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
        }
    }

    /// 已写入的字节
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// 已写入的内容 (按 UTF-8 解释，非法时返回空串)
    pub fn as_str(&self) -> &str {
        core::str::from_utf8(self.as_bytes()).unwrap_or("")
    }

    /// 已写入的字节数
    pub fn len(&self) -> usize {
        self.len
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl<const N: usize> Default for FixedBuf<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RawWrite for FixedBuf<N> {
    fn write_raw(&mut self, bytes: &[u8]) {
        let remaining = &mut self.buf[self.len..];
        let to_copy = core::cmp::min(bytes.len(), remaining.len());
        remaining[..to_copy].copy_from_slice(&bytes[..to_copy]);
        self.len += to_copy;
    }
}
