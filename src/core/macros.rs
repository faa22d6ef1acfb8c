//! 核心宏定义
//!
//! 提供统一的宏来减少配置结构体的样板代码

/// 为结构体实现Default trait的宏
///
/// 使用示例:
/// ```rust
/// use snowscape::impl_default;
///
/// struct FogSettings {
///     near: f32,
///     far: f32,
/// }
///
/// impl_default!(FogSettings {
///     near: 1.0,
///     far: 100.0,
/// });
///
/// assert_eq!(FogSettings::default().far, 100.0);
/// ```
#[macro_export]
macro_rules! impl_default {
    ($struct_name:ident {
        $($field:ident: $value:expr),* $(,)?
    }) => {
        impl Default for $struct_name {
            fn default() -> Self {
                Self {
                    $($field: $value),*
                }
            }
        }
    };
}
