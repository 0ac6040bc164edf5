//! 编译 proto 目录下的协议文件
//!
//! 未设置 `PROTOC` 时使用 protoc-bin-vendored 自带的 protoc

fn main() -> Result<(), Box<dyn std::error::Error>> {
    if std::env::var_os("PROTOC").is_none() {
        let protoc = protoc_bin_vendored::protoc_bin_path()?;
        // SAFETY: 构建脚本是单线程的，此时没有其他线程读取环境变量
        unsafe {
            std::env::set_var("PROTOC", protoc);
        }
    }

    tonic_prost_build::configure()
        .build_server(true)
        .build_client(true)
        .compile_protos(&["proto/users.proto", "proto/products.proto"], &["proto"])?;

    println!("cargo:rerun-if-changed=proto");
    Ok(())
}
